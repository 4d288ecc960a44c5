use crate::defs::DigestDelivery;
use crate::defs::DigestOutput;

/// Delivery that drops every digest on the floor. Used for dry runs.
pub struct NullDelivery;

impl DigestDelivery for NullDelivery {
    fn deliver(&self, _digest: &DigestOutput) -> anyhow::Result<()> {
        // Nothing to send, nothing can fail.
        Ok(())
    }

    fn channel_name(&self) -> String {
        "none".to_owned()
    }
}
