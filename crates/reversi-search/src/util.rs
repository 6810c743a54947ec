pub mod busy_flag;
