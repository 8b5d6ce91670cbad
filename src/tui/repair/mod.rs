//! Repair management screen
//!
//! `model` holds the pure state machine, `session` runs its effects against a
//! `RepairService`, and `view` is the iocraft component that renders it.

mod confirm_modal;
pub mod model;
pub mod session;
pub mod shortcuts;
pub mod view;

pub use model::{
    RepairAction, RepairEffect, RepairMode, RepairState, RepairViewModel,
    compute_repair_view_model, key_to_action, reduce_repair_state,
};
pub use session::{RepairSession, run_effect};
pub use view::{RepairManager, RepairManagerProps};
