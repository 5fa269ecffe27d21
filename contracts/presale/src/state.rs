use cw_storage_plus::Item;
use presale_types::msg::Config;

pub const CONFIG: Item<Config> = Item::new("config");
