mod subscription_lifecycle_tests;
