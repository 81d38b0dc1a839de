mod maps;
mod send;
mod server;
mod telegram;

pub use maps::check as check_maps;
pub use send::send;
pub use server::serve;
pub use telegram::check;
