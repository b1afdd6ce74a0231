mod broadcast;
mod comms;
mod election;
mod failure;
mod mobility;
