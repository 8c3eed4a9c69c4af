pub mod energy_vad;
