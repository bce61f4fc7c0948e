mod money;
mod operation;
mod wallet;

pub use money::*;
pub use operation::*;
pub use wallet::*;
