mod test_chat_broadcast;
mod test_join_snapshot;
mod test_typing_broadcast;
