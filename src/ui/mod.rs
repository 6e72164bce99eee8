//! Terminal UI layer for the interactive chat session.
//!
//! [`chat_loop`] runs the event loop and owns keyboard dispatch;
//! [`layout`] composes the frame; [`transcript`] turns the message store
//! into styled lines, reusing the same block/inline parse the HTML
//! renderer consumes so display and export never disagree about
//! structure.

pub mod chat_loop;
pub mod layout;
pub mod transcript;
