pub mod ffvb;
