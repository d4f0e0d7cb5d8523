mod remote_trigger;
