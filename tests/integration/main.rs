//! Integration suite for the LiveFeed synchronizer, driven end to end
//! against scripted fakes for the transport, store, and push channel.

mod helpers;

mod push_test;
mod refresh_test;
