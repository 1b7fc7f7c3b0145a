/// Address storage for the fuzz harness.
///
/// The flows drive the ledger staging functions directly rather than sending
/// transactions, so no account addresses need to be kept between flows.
#[derive(Default)]
pub struct AccountAddresses {}
