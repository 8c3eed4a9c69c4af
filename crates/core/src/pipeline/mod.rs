pub mod find_word_use_case;
