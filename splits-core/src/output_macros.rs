//! Output macros shared by the split config binaries.
//!
//! Results go to stdout, problems go to stderr. Diagnostics for developers
//! belong in `tracing`, not here.

#[macro_export]
macro_rules! splits_print {
    ($($arg:tt)*) => {
        print!("{}", format!($($arg)*));
    }
}

#[macro_export]
macro_rules! splits_println {
    () => {
        println!();
    };
    ($($arg:tt)*) => {
        println!("{}", format!($($arg)*));
    }
}

#[macro_export]
macro_rules! splits_warning {
    ($($arg:tt)*) => {
        eprintln!("⚠️  {}", format!($($arg)*));
    }
}
