mod console;

pub use self::console::*;
