// #![warn(
//     clippy::all,
//     clippy::pedantic,
// )]

pub mod array;
pub mod numerical;
pub mod sparse;
