pub mod assigner;
pub mod calculator;

pub use assigner::{assign_house, cusps_partition_circle, HouseAssignment};
pub use calculator::{
    ascendant, greenwich_sidereal_time_deg, local_sidereal_time_hours, midheaven, HouseCusps,
    OBLIQUITY_DEG,
};
