// Identity module - account addresses and local ed25519 keys

mod address;
mod keypair;

pub use address::{Address, AddressError, ADDRESS_LEN};
pub use keypair::{Keypair, KeypairError, PublicKey};
