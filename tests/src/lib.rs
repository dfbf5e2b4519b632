//! End-to-end sweeps against a scripted in-memory device.

#[cfg(test)]
mod fake;
#[cfg(test)]
mod sweep;
