mod from_response_value_tests;
mod response_envelope_tests;
