mod star_wars_client;

mod interface_assignment_tests;
