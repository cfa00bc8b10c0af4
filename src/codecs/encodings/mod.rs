pub mod alp;
pub mod bitpacking;
pub mod exceptions;
pub mod ffor;
pub mod packed_ints;
pub mod ree;
pub mod zigzag;
