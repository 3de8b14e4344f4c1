use std::{marker::PhantomData, mem::MaybeUninit, time::Duration};

/// Monotonic clock
#[derive(Debug)]
pub struct Monotonic;

impl ClockSource for Monotonic {
    fn id() -> libc::clockid_t {
        libc::CLOCK_MONOTONIC
    }
}

/// Id for a clock according to unix clockid_t
pub trait ClockSource {
    /// Gets the id of the clock source
    fn id() -> libc::clockid_t;
}

/// Defines a clock with a specific kind
#[derive(Debug)]
pub struct Clock<Kind> {
    clk_id: libc::clockid_t,
    _kind: PhantomData<Kind>,
}

impl<Kind: ClockSource> Clock<Kind> {
    /// Initialize a new clock
    pub fn new() -> std::io::Result<Self> {
        let clk_id = Kind::id();
        clock_get_time(clk_id)?;
        Ok(Clock {
            clk_id,
            _kind: PhantomData,
        })
    }

    /// Returns the current time, or zero if the clock became unreadable
    pub fn now(&self) -> Duration {
        clock_get_time(self.clk_id)
            .map(|tp| Duration::new(tp.tv_sec as u64, tp.tv_nsec as u32))
            .unwrap_or(Duration::ZERO)
    }

    /// Current time as the millisecond timestamp carried by input events
    ///
    /// The value wraps around like the timestamps of wayland input events.
    pub fn now_msec(&self) -> u32 {
        self.now().as_millis() as u32
    }
}

fn clock_get_time(clk_id: libc::clockid_t) -> Result<libc::timespec, std::io::Error> {
    let mut tp = MaybeUninit::zeroed();
    unsafe {
        let res = libc::clock_gettime(clk_id, tp.as_mut_ptr());

        if res < 0 {
            return Err(std::io::Error::last_os_error());
        }

        Ok(tp.assume_init())
    }
}
