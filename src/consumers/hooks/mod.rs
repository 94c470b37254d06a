pub mod pre_start;
