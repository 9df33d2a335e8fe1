/// Producer thread lifecycle and the live tick loop.
pub mod driver;
