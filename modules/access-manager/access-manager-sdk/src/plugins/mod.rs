//! Standard plugins: rule tables, primitives, composition and legacy adapters.

pub mod compound;
pub mod legacy;
pub mod primitives;
pub mod rules;
pub mod superuser;

pub use compound::CompoundPlugin;
pub use legacy::{CheckAblePlugin, CheckApplyPlugin, CheckOutcome, SimpleCheckPlugin};
pub use primitives::{ApplyAblePlugin, VerifyAblePlugin};
pub use rules::{ApplyRules, VerifyRules};
pub use superuser::SuperuserBypass;
