pub mod event;
pub mod game;
pub mod result;
pub mod selection;
pub mod session;
