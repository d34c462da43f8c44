mod helpers;
mod mocks;
mod oauth;
mod orders;
mod polling;
