mod type_annotation_tests;
