mod literal_round_trip_tests;
