mod bindings_file_tests;
