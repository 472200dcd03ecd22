// Discord commands module.
// Each audience gets its own command file.

pub mod help;
pub mod member;
pub mod owner;
pub mod staff;

// Presence glue used by the owner commands and the ready hook.
pub mod presence;

use crate::discord::{Data, Error};

/// Every command the framework knows about, in `$help` order.
pub fn all() -> Vec<poise::Command<Data, Error>> {
    vec![
        staff::kick(),
        staff::ban(),
        staff::purge(),
        staff::embed(),
        owner::setstatus(),
        owner::seturl(),
        owner::setpresence(),
        owner::shutdown(),
        member::rank(),
        member::link(),
        member::pong(),
        help::help(),
    ]
}
