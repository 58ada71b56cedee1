//! Sensor conversions.  Raw reads happen in the target binary; this
//! module only turns counts into engineering units so it runs on host.

pub mod ntc;
