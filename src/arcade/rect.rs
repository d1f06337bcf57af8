/// Axis-aligned rectangle in world units. Edges are half-open, so rects
/// that only touch do not overlap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect
{
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect
{
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self
    {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> i32
    {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32
    {
        self.y + self.h
    }

    pub fn set_center(&mut self, cx: i32, cy: i32)
    {
        self.x = cx - self.w / 2;
        self.y = cy - self.h / 2;
    }

    pub fn intersects(&self, other: &Rect) -> bool
    {
        self.w > 0
            && self.h > 0
            && other.w > 0
            && other.h > 0
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Grows (or shrinks, for negative deltas) around the same center.
    /// Sizes never go below zero.
    pub fn inflate(&self, dw: i32, dh: i32) -> Rect
    {
        let w = (self.w + dw).max(0);
        let h = (self.h + dh).max(0);
        Rect {
            x: self.x - (w - self.w) / 2,
            y: self.y - (h - self.h) / 2,
            w,
            h,
        }
    }

    /// Moves the rect inside `bounds`. A rect larger than `bounds` on an
    /// axis is centered on that axis.
    pub fn clamp_within(&mut self, bounds: &Rect)
    {
        self.x = clamp_axis(self.x, self.w, bounds.x, bounds.w);
        self.y = clamp_axis(self.y, self.h, bounds.y, bounds.h);
    }
}

fn clamp_axis(pos: i32, len: i32, start: i32, span: i32) -> i32
{
    if len >= span {
        start + (span - len) / 2
    } else {
        pos.clamp(start, start + span - len)
    }
}
