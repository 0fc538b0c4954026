//! Logging macros.
//!
//! Every macro compiles to nothing unless one of the logging features is on:
//! `esp32-log` prints through `esp-println`, `defmt` forwards to the `defmt` macros.
//! Format strings must stay within the subset both backends understand
//! (plain `{}` placeholders over primitives and `&str`).
#![allow(unused_macros)]

macro_rules! trace {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::trace!($s $(, $x)*);
        #[cfg(feature = "esp32-log")]
        ::esp_println::println!(concat!("[TRACE] ", $s) $(, $x)*);
        #[cfg(not(any(feature = "defmt", feature = "esp32-log")))]
        let _ = ($( & $x, )*);
    }};
}

macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::debug!($s $(, $x)*);
        #[cfg(feature = "esp32-log")]
        ::esp_println::println!(concat!("[DEBUG] ", $s) $(, $x)*);
        #[cfg(not(any(feature = "defmt", feature = "esp32-log")))]
        let _ = ($( & $x, )*);
    }};
}

macro_rules! info {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::info!($s $(, $x)*);
        #[cfg(feature = "esp32-log")]
        ::esp_println::println!(concat!("[INFO] ", $s) $(, $x)*);
        #[cfg(not(any(feature = "defmt", feature = "esp32-log")))]
        let _ = ($( & $x, )*);
    }};
}

macro_rules! warn {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::warn!($s $(, $x)*);
        #[cfg(feature = "esp32-log")]
        ::esp_println::println!(concat!("[WARN] ", $s) $(, $x)*);
        #[cfg(not(any(feature = "defmt", feature = "esp32-log")))]
        let _ = ($( & $x, )*);
    }};
}

macro_rules! error {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::error!($s $(, $x)*);
        #[cfg(feature = "esp32-log")]
        ::esp_println::println!(concat!("[ERROR] ", $s) $(, $x)*);
        #[cfg(not(any(feature = "defmt", feature = "esp32-log")))]
        let _ = ($( & $x, )*);
    }};
}
