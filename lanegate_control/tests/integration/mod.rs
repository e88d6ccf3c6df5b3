mod fault_paths;
mod lane_cycle;
