use cosmwasm_schema::cw_serde;

pub use presale_types::msg::{Config, InstantiateMsg, MigrateMsg, QueryMsg};

#[cw_serde]
pub enum ExecuteMsg {
    Pause {},
    Unpause {},
    SetPausers { pausers: Vec<String> },
}
