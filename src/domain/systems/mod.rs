pub mod collision;
pub mod control;
pub mod kinematics;
pub mod player;
pub mod scroll;
