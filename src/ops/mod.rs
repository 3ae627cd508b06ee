pub mod material_ops;
pub mod normalize;
pub mod note_ops;
pub mod reconcile;
pub mod stats;
pub mod task_ops;
pub mod view;
