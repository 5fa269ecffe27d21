pub mod presale_mock_messages;
pub mod settings_mock_messages;
