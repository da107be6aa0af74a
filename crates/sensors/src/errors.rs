/// Failure talking to a device. The driver does not retry, the bus error is
/// handed back as is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error<E> {
    #[error("Bus transfer failed: {0:?}")]
    Bus(E),
}
