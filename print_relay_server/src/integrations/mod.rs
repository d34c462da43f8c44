pub mod clover;
