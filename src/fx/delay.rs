/// Longest selectable delay time; the buffer is sized to cover it.
const MAX_DELAY_SECS: f32 = 2.0;

/// Feedback echo on the summed mix.
///
/// The write head stores `input + delayed * feedback`, so each pass through
/// the buffer decays geometrically. The output is `input + delayed`, dry
/// signal always present.
pub struct Delay {
    buffer: Vec<f32>,
    write_pos: usize,
    time: f32,
    feedback: f32,
    sample_rate: f32,
}

impl Delay {
    pub fn new(sample_rate: f32) -> Self {
        let mut delay = Self {
            buffer: Vec::new(),
            write_pos: 0,
            time: 0.25,
            feedback: 0.3,
            sample_rate,
        };
        delay.resize_buffer();
        delay
    }

    pub fn set_time(&mut self, time: f32) {
        self.time = time.clamp(0.001, MAX_DELAY_SECS);
    }

    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 0.9);
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.resize_buffer();
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    pub fn process(&mut self, input: f32) -> f32 {
        let len = self.buffer.len();
        let delay_samples = ((self.time * self.sample_rate) as usize).clamp(1, len - 1);

        let read_pos = (self.write_pos + len - delay_samples) % len;
        let delayed = self.buffer[read_pos];

        self.buffer[self.write_pos] = input + delayed * self.feedback;
        self.write_pos = (self.write_pos + 1) % len;

        input + delayed
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }

    fn resize_buffer(&mut self) {
        let len = (self.sample_rate * MAX_DELAY_SECS) as usize + 1;
        self.buffer.clear();
        self.buffer.resize(len, 0.0);
        self.write_pos = 0;
    }
}
