#![allow(dead_code)]

pub mod advertiser;
pub mod config;
pub mod emit;

pub fn deamonize() -> Result<(), ()> {
    let res = unsafe { libc::setsid() };
    match res {
        -1 => return Err(()),
        _ => {}
    }

    let res = unsafe { libc::fork() };
    match res {
        -1 => return Err(()),
        0 => return Ok(()),
        _ => std::process::exit(0),
    }
}
