pub mod coach;
pub mod intake;
pub mod packet;
pub mod readiness;
pub mod signup;
