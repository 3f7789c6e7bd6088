//! Logging helpers shared by the assertion components.

use slog::Logger;

/// Extension trait for `slog::Logger`
pub trait LoggerExtensions {
    /// Create a new child logger with a `src` key containing the component name.
    fn new_with_component_name<T>(&self) -> Self;
}

impl LoggerExtensions for Logger {
    fn new_with_component_name<T>(&self) -> Self {
        self.new(slog::o!("src" => component_name::<T>()))
    }
}

/// A logger dropping every record, used when no logger is given.
pub fn discard_logger() -> Logger {
    Logger::root(slog::Discard, slog::o!())
}

fn component_name<T>() -> &'static str {
    let complete_name = std::any::type_name::<T>();
    let without_generic = complete_name.split('<').next().unwrap_or(complete_name);

    without_generic
        .rsplit("::")
        .next()
        .unwrap_or(without_generic)
}
