mod engine_step;
