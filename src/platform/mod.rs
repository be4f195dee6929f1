// ABOUTME: Transport implementations of the RoomChannel trait
// ABOUTME: Currently Matrix only

pub mod matrix;

pub use matrix::MatrixRoomChannel;
