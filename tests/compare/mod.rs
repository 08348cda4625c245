mod compare_accounts_from_config;
mod compare_corrupt_object_fails;
mod compare_double_dot_on_linear_history;
mod compare_empty_expression_counts_nothing;
mod compare_packed_refs_and_annotated_tags;
mod compare_stats_and_files;
mod compare_text_output;
mod compare_triple_dot_since_merge_base;
mod compare_unknown_revision_is_not_found;
mod compare_unrelated_histories;
mod compare_verifies_ssh_signatures;
