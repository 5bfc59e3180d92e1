use crate::ToBytes;
use crate::codec::Writer;
use crate::types::NAME_LEN;

#[derive(Debug)]
pub struct TradeRequest {
    pub name: String,
}

impl ToBytes for TradeRequest {
    fn write_payload(&self, w: &mut Writer) {
        w.write_string(&self.name, NAME_LEN);
    }
}

/// Answer to an incoming trade request.
#[derive(Debug)]
pub struct TradeRespond {
    pub accept: bool,
}

impl ToBytes for TradeRespond {
    fn write_payload(&self, w: &mut Writer) {
        w.write_bool(self.accept);
    }
}

#[derive(Debug)]
pub struct TradeAddItem {
    pub item_id: u16,
    pub amount: u32,
}

impl ToBytes for TradeAddItem {
    fn write_payload(&self, w: &mut Writer) {
        w.write_u16(self.item_id);
        w.write_u32(self.amount);
    }
}

#[derive(Debug)]
pub struct TradeConfirm;

impl ToBytes for TradeConfirm {
    fn write_payload(&self, _w: &mut Writer) {}
}

#[derive(Debug)]
pub struct TradeCancel;

impl ToBytes for TradeCancel {
    fn write_payload(&self, _w: &mut Writer) {}
}
