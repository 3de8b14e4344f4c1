//! Backend (hardware) abstractions
//!
//! The input core does not talk to hardware itself. The embedding compositor reads its
//! devices and feeds the resulting [`input::InputEvent`]s to
//! [`Input::process_input_event`](crate::input::Input::process_input_event).

pub mod input;
