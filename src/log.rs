//! Console output helpers
//!
//! `log_print!` writes to stdout and is reserved for results. The other macros
//! write to stderr so that the result lines can be piped or compared as-is.

use colored::Colorize;
use std::{
	fmt,
	sync::atomic::{AtomicBool, Ordering},
};

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Enable or disable verbose diagnostics for the whole process
pub fn set_verbose(verbose: bool) {
	VERBOSE.store(verbose, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
	VERBOSE.load(Ordering::Relaxed)
}

#[doc(hidden)]
pub fn print_error(args: fmt::Arguments) {
	eprintln!("{} {}", "❌ Error:".bright_red().bold(), args);
}

/// Print a result line to stdout
#[macro_export]
macro_rules! log_print {
	($($arg:tt)*) => {
		println!($($arg)*)
	};
}

/// Print a diagnostic line to stderr, only in verbose mode
#[macro_export]
macro_rules! log_verbose {
	($($arg:tt)*) => {
		if $crate::log::is_verbose() {
			eprintln!($($arg)*);
		}
	};
}

#[macro_export]
macro_rules! log_error {
	($($arg:tt)*) => {
		$crate::log::print_error(format_args!($($arg)*))
	};
}
