mod transaction;
mod wallet;

pub use transaction::{Decimal, SideCurrency, SideWallet, Transaction, TransactionSide};
pub use wallet::{Session, Wallet};
