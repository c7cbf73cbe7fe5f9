use std::time::Duration;

use super::controller::AutoScrollController;
use super::messages::AutoScrollMessage;
use crate::page::Page;
use crate::scheduler::Scheduler;

pub fn update(
    controller: &mut AutoScrollController,
    page: &mut Page,
    scheduler: &mut Scheduler,
    now: Duration,
    msg: AutoScrollMessage,
) {
    match msg {
        AutoScrollMessage::InteractionStart(region) => {
            controller.pause(scheduler, region);
        }
        AutoScrollMessage::InteractionEnd(region) => {
            controller.schedule_resume(scheduler, region, now);
        }
        AutoScrollMessage::Wheel(region) => {
            controller.pause(scheduler, region);
            controller.schedule_resume(scheduler, region, now);
        }
        AutoScrollMessage::Frame {
            region,
            handle,
            now,
        } => controller.step(page, scheduler, region, handle, now),
        AutoScrollMessage::ResumeElapsed { region, handle } => {
            controller.resume_elapsed(region, handle);
        }
        AutoScrollMessage::Remeasure => controller.refresh(page, scheduler),
    }
}
