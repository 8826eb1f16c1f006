pub mod money;
pub mod period;
pub mod transaction;

pub use money::Money;
pub use period::DateRange;
pub use transaction::{
    BankTransaction, Match, ParseKindError, Sign, Summary, SystemTransaction, TxKind,
};
