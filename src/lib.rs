pub mod mediamover_core;
