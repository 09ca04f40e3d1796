//! Sheet state and logic (UI-agnostic).

mod io;
mod ops;
mod state;
mod view;

pub use state::Sheet;
pub use view::CellView;
