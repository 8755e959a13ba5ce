mod client_config_tests;
