mod tests_batches;
mod tests_event_loop;
mod tests_project;
